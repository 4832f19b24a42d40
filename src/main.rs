//! Browser entry point: mounts the application to `<body>`.

#[cfg(feature = "csr")]
fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(learnhub_client::app::App);
}

#[cfg(not(feature = "csr"))]
fn main() {
    // Nothing to run outside the browser; native builds exist for tests.
}
