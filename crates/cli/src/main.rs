fn main() {
    if let Err(e) = rtpsync_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
