fn main() {
    #[cfg(feature = "cli")]
    lockdiff::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("lockdiff: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
