//! Properties for the roleplay viewer.

use yew::prelude::*;

use crate::api::ApiClient;

/// Configuration the viewer receives from the root component. The email
/// travels in from the navigation query string; it is the only identity
/// the viewer ever has.
#[derive(Properties, PartialEq, Clone)]
pub struct ViewerProps {
    pub email: String,
    /// Target exercise model; resolved against the models listing on mount.
    pub model_id: u32,
    /// Owning category, when known; carried through navigation.
    #[prop_or_default]
    pub category_id: Option<u32>,
    pub api: ApiClient,
}
