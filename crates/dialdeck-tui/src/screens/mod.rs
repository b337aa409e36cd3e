//! Screen implementations. Each screen is a top-level Component.

pub mod campaigns;
pub mod create;
pub mod dashboard;
pub mod quick_call;
pub mod simulate;

use crate::component::Component;
use crate::screen::ScreenId;

use campaigns::CampaignsScreen;
use dashboard::DashboardScreen;

/// Create all screens in tab order.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(DashboardScreen::new()) as Box<dyn Component>,
        ),
        (ScreenId::Campaigns, Box::new(CampaignsScreen::new())),
    ]
}
