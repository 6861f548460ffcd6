// Property-based tests
// Run with: cargo test --test property

mod placement_properties;
mod reconcile_properties;
mod week_properties;
