use std::rc::Rc;

use invoice_dashboard::{
    components::{App, AppProps},
    config::AppConfig,
};

fn main() {
    let config = AppConfig::load();
    wasm_logger::init(wasm_logger::Config::new(config.log_level()));
    log::info!("using backend at {}", config.api_base_url);

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
