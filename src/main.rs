#[cfg(target_arch = "wasm32")]
fn main() {
    kidquiz::wasm::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("kidquiz runs in the browser; serve it with `trunk serve`.");
}
