use std::env;
use std::fs;
use std::path::Path;
use std::process;

use nand2hack::asm::assemble;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: hackasm <file.asm>");
        process::exit(2);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("no such file or directory: {}", path.display());
        process::exit(2);
    }
    if path.is_dir() {
        eprintln!("expected a .asm file, got a directory: {}", path.display());
        process::exit(3);
    }
    if path.extension().and_then(|e| e.to_str()) != Some("asm") {
        eprintln!("expected a .asm file, got {}", path.display());
        process::exit(3);
    }

    let source = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("failed to read {}: {err}", path.display());
        process::exit(2);
    });

    match assemble(&source) {
        Ok(hack) => {
            let out_path = path.with_extension("hack");
            if let Err(err) = fs::write(&out_path, hack) {
                eprintln!("failed to write {}: {err}", out_path.display());
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
