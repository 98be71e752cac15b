fn main() {
    if let Err(err) = client_rename::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
