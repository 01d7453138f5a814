pub mod composer;
pub mod notifier;
pub mod poller;
