use crate::app::App;

mod api;
mod app;
mod components;
mod detect;

fn main() {
    yew::Renderer::<App>::new().render();
}
