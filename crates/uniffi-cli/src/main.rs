use std::env;

/// Kotlin bindings for the Android host unless swift is asked for
fn main() {
    let wants_swift = env::args().skip(1).any(|arg| arg.eq_ignore_ascii_case("swift"));

    if wants_swift {
        uniffi::uniffi_bindgen_swift();
    } else {
        uniffi::uniffi_bindgen_main();
    }
}
