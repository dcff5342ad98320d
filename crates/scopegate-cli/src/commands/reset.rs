pub fn run(store_dir: Option<&str>) {
    let store = super::store_at(store_dir);
    match store.clear() {
        Ok(()) => println!("unlock flag cleared ({})", store.dir().display()),
        Err(e) => {
            eprintln!("could not clear unlock flag: {e}");
            std::process::exit(1);
        }
    }
}
