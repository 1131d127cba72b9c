//! Basic usage of the `grow_vec` crate:
//!
//! * Creating a container.
//! * Appending, inserting and erasing elements.
//! * Watching the capacity grow.

use grow_vec::GrowVec;

fn main() {
    let mut names = GrowVec::<String>::new();

    // Every time the container is full, the next append doubles its capacity.
    for name in ["Alice", "Bob", "Charlie", "Dave", "Eve"] {
        names.push(name.to_string());
        println!(
            "Pushed {name}: {} items, capacity {}",
            names.len(),
            names.capacity()
        );
    }

    // Inserting returns the position of the new element.
    let position = names.insert(1, "Mallory".to_string());
    println!("Inserted {} at position {position}", names[position]);

    // Erasing returns the position of the element that followed the removed one.
    let position = names.erase(position);
    println!("After erasing, position {position} holds {}", names[position]);

    // Elements can be modified in place through the slice the container derefs to.
    names[0].push_str(" Smith");

    for (index, name) in names.iter().enumerate() {
        println!("{index}: {name}");
    }
}
