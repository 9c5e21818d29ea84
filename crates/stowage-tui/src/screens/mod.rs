//! Screen components: one per [`ScreenId`](crate::screen::ScreenId).

mod admin;
mod login;
mod user;

pub use admin::AdminScreen;
pub use login::LoginScreen;
pub use user::UserScreen;

use crate::component::Component;
use crate::screen::ScreenId;

/// Build all screens in their initial state.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Login, Box::new(LoginScreen::new())),
        (ScreenId::Admin, Box::new(AdminScreen::new())),
        (ScreenId::User, Box::new(UserScreen::new())),
    ]
}
