use std::collections::HashMap;
use std::env;
use std::fmt::Write;
use std::path::PathBuf;

fn main() {
    // (Variable, Type, Default value)
    let mut configs: HashMap<&str, (&str, &str)> = HashMap::from([
        ("MAX_PKT_LENGTH", ("usize", "127")),
        ("MAX_MHR_OVERHEAD", ("usize", "25")),
        ("DEFAULT_PAN_ID", ("u16", "0x0023")),
        ("DEFAULT_CHANNEL", ("u8", "26")),
        ("DEFAULT_ADDR_SHORT", ("u16", "0x0230")),
        ("DEFAULT_ADDR_LONG", ("u64", "0x1222_3344_5566_7788")),
    ]);

    // Make sure we get rerun if needed
    println!("cargo:rerun-if-changed=build.rs");
    for name in configs.keys() {
        println!("cargo:rerun-if-env-changed=L2_REFLECTOR_{name}");
    }

    let mut data = String::new();

    for (var, value) in env::vars() {
        if let Some(name) = var.strip_prefix("L2_REFLECTOR_") {
            // discard from hashmap as a way of consuming the setting
            let Some((_, (ty, _))) = configs.remove_entry(name) else {
                panic!("Wrong configuration name {name}");
            };

            writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
        }
    }

    // Take the remaining configs and write the default value to the file
    for (name, (ty, value)) in configs.iter() {
        writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
    }

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let out_file = out_dir.join("config.rs");
    std::fs::write(out_file, data).unwrap();
}
