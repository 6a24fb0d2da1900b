//! Binary entrypoint for texfind

fn main() {
    if let Err(err) = texfind_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
