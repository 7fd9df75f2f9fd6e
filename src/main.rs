fn main() {
    if let Err(e) = arihante::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
