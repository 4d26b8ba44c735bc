/// Keyboard commands a shortcut can be bound to.
pub const COMMAND_POOL: [&str; 10] = [
    "shortcut-01",
    "shortcut-02",
    "shortcut-03",
    "shortcut-04",
    "shortcut-05",
    "shortcut-06",
    "shortcut-07",
    "shortcut-08",
    "shortcut-09",
    "shortcut-10",
];

/// Reserved command that opens the options page.
pub const OPEN_OPTIONS_COMMAND: &str = "open-custom-url";

pub fn is_pool_command(id: &str) -> bool {
    COMMAND_POOL.contains(&id)
}
