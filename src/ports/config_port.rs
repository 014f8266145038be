//! Configuration access port trait.

pub trait ConfigPort {
    /// Trimmed value, or `None` when the key is absent or blank.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// Section names, lowercased, in no particular order.
    fn sections(&self) -> Vec<String>;
}
