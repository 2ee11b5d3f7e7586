fn main() {
    // Host builds (no `espidf` feature) compile the library with simulation
    // adapters and need no ESP-IDF environment.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
