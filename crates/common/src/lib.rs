pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn logging_init_honors_format_switch_and_tolerates_reinit() {
        std::env::set_var("LOG_FORMAT", "json");
        utils::logging::init_logging();
        // A second init must be a no-op, whatever format was picked first.
        std::env::remove_var("LOG_FORMAT");
        utils::logging::init_logging();
    }
}
