//! Rents scratch buffers from a pool while processing a batch of messages, then shows how the
//! shared list pools are used without any setup.

use rental_pool::{FnPolicy, Pool, shared_list};

fn main() {
    // Buffers that grew beyond 4 KiB are dropped instead of being kept in the pool.
    let policy = FnPolicy::new(
        || Vec::<u8>::with_capacity(256),
        |buffer: &mut Vec<u8>| {
            buffer.clear();
            buffer.capacity() <= 4096
        },
    );

    let pool: Pool<Vec<u8>, _> = Pool::builder(policy).capacity(4).prewarm(2).build();

    for message in ["hello", "pooled", "world"] {
        let mut buffer = pool.rent_scoped();
        buffer.extend_from_slice(message.as_bytes());
        buffer.reverse();

        println!("{}", String::from_utf8_lossy(&buffer));
    }

    println!(
        "idle buffers: {}, rented buffers: {}",
        pool.idle_count(),
        pool.rented_count()
    );

    let mut words = shared_list::rent::<&str>();
    words.extend(["no", "setup", "needed"]);
    println!("{}", words.join(" "));
    shared_list::return_list(words);
}
