use std::path::PathBuf;

use dispatcher_farms::FarmSet;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/farms.json"));

    let set = FarmSet::from_file(&path).expect("failed to read farm set");
    let compiled = match set.compile() {
        Ok(compiled) => compiled,
        Err(diagnostics) => {
            eprintln!("{} invalid parameter(s):", diagnostics.len());
            for d in diagnostics {
                eprintln!("  {d}");
            }
            std::process::exit(1);
        }
    };

    for farm in compiled.farms() {
        println!("# {} (priority {})", farm.file_name(), farm.priority());
        print!("{}", farm.text());
        println!();
    }

    println!("# dispatcher.any");
    print!("{}", compiled.include_document());
    println!();

    println!("# dispatcher.conf");
    print!("{}", compiled.module_config());
}
