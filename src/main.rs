fn main() {
    if let Err(err) = gitversion::cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
