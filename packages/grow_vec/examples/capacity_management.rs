//! Explicit capacity management with `grow_vec`:
//!
//! * Reserving an exact capacity up front.
//! * Resizing up and down without giving memory back.
//! * Handling allocation problems as errors.
//! * Requiring explicit cleanup via a drop policy.

use grow_vec::{DropPolicy, GrowVec};

fn main() {
    let mut samples = GrowVec::<f64>::builder().capacity(8).build();
    println!(
        "Created a container with {} items and capacity {}",
        samples.len(),
        samples.capacity()
    );

    // Reserving takes the total capacity, not an increment, and never doubles.
    samples.reserve(100);
    println!("After reserve(100): capacity {}", samples.capacity());

    // Growing by resize fills the new slots with default values.
    samples.resize(10);
    println!("After resize(10): {samples:?}");

    // Shrinking keeps the buffer, so the capacity stays where it was.
    samples.resize(2);
    println!(
        "After resize(2): {} items, capacity {}",
        samples.len(),
        samples.capacity()
    );

    // Requests that can never be satisfied are reported instead of aborting the process.
    match samples.try_reserve(usize::MAX) {
        Ok(()) => println!("Unexpectedly reserved usize::MAX slots"),
        Err(error) => println!("try_reserve(usize::MAX) failed: {error}"),
    }

    // A container with this policy panics if it is dropped while still holding elements.
    let mut pending = GrowVec::builder()
        .drop_policy(DropPolicy::MustNotDropItems)
        .build();
    pending.push("job 1");
    pending.push("job 2");

    while let Some(job) = pending.pop() {
        println!("Finished {job}");
    }

    println!("All pending jobs finished, the container may now be dropped");
}
