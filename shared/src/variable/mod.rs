pub mod error;
pub mod list_event;
pub mod notifier;
pub mod replicated_list;
pub mod replicated_value;
pub mod replicated_variable;
