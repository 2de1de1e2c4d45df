// Native messaging host binary; all logging goes to stderr, stdout carries messages
fn main() {
    pastequeue_lib::run()
}
