/// Domain models shared between the server, client, and worker crates.
///
/// # Models
///
/// - `task`: `Task` and `TaskResult`, the only data the core ever moves
///   between peers. Both are opaque byte payloads from the core's
///   perspective.
pub mod task;
