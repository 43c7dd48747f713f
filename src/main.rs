fn main() {
    if let Err(err) = logoforge::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
