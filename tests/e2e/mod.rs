// End-to-end tests for the Narrator Backend HTTP API
//
// Each test starts the real router on an ephemeral port, backed by its own
// temporary storage areas, a scripted WAV synthesis backend and the native
// WAV merger, so no external engine is needed.

pub mod helpers;

mod test_health;
mod test_status;
