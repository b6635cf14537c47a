use std::thread;

/// Hands `data` to a detached thread so that freeing large trace buffers does not sit on
/// the prover's critical path.
pub fn drop_in_background_thread<T>(data: T)
where
    T: Send + 'static,
{
    thread::spawn(move || drop(data));
}
