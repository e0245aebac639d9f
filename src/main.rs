fn main() {
    if let Err(err) = trustscan::cli::run() {
        trustscan::ui::eprintln_error(&err);
        std::process::exit(trustscan::exit::exit_code(&err));
    }
}
