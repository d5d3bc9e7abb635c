#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod anchor;
mod config;
mod contact;
mod lightbox;
mod log;
mod nav;
mod reveal;
mod typewriter;
mod year;

#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This crate only runs in the browser. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
