//! Draws viewable objects into a terminal window.

use crate::reddit::thing::Post;
use indoc::formatdoc;

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self) -> String;
}

impl Viewable for Post {
    fn view(&self) -> String {
        formatdoc! {"
            Title: {}
            URL: {}
            ---",
            self.title(),
            self.url(),
        }
    }
}
