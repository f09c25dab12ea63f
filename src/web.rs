//! The host page contract on the web.
//!
//! The page provides a `#gallery-container` to mount the canvas into, an
//! optional `#loading-screen`, four compass arrows (`#arrow-back`,
//! `#arrow-front`, `#arrow-left`, `#arrow-right`) and an optional `#art-info`
//! panel. Missing optional elements are skipped.

use std::rc::Rc;

use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Document, HtmlElement};
use winit::{platform::web::WindowExtWebSys, window::Window};

use crate::navigation::Compass;

const CONTAINER_ID: &str = "gallery-container";
const LOADING_SCREEN_ID: &str = "loading-screen";
const ART_INFO_ID: &str = "art-info";
const LOADING_FADE_MS: i32 = 500;

fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

/// Appends the window's canvas to the container (or `<body>`).
pub fn mount_canvas(window: &Window) {
    let (Some(canvas), Some(document)) = (window.canvas(), document()) else {
        log::error!("no canvas or document to mount the gallery into");
        return;
    };
    let style = canvas.style();
    let _ = style.set_property("width", "100%");
    let _ = style.set_property("height", "100%");
    let _ = style.set_property("display", "block");

    let parent = document
        .get_element_by_id(CONTAINER_ID)
        .or_else(|| document.body().map(Into::into));
    match parent {
        Some(parent) => {
            if parent.append_child(&canvas).is_err() {
                log::error!("could not append the canvas to #{CONTAINER_ID}");
            }
        }
        None => log::error!("page has neither #{CONTAINER_ID} nor a body"),
    }
}

/// Fades the loading screen out and hides it once the fade is over.
pub fn hide_loading_screen() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(screen) = document()
        .and_then(|document| document.get_element_by_id(LOADING_SCREEN_ID))
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let _ = screen.style().set_property("opacity", "0");
    let hide = Closure::once_into_js(move || {
        let _ = screen.style().set_property("display", "none");
    });
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), LOADING_FADE_MS)
        .is_err()
    {
        log::warn!("could not schedule hiding the loading screen");
    }
}

/// Calls `on_select` with the matching compass when an arrow is clicked.
pub fn bind_compass_controls(on_select: impl Fn(Compass) + 'static) {
    let Some(document) = document() else {
        return;
    };
    let on_select = Rc::new(on_select);
    for compass in Compass::ALL {
        let id = format!("arrow-{}", compass.name().to_lowercase());
        let Some(element) = document.get_element_by_id(&id) else {
            log::debug!("no #{id} on the page");
            continue;
        };
        let on_select = on_select.clone();
        let listener = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_event: web_sys::MouseEvent| {
            on_select(compass)
        });
        if element
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("could not listen to clicks on #{id}");
        }
        // the listener lives as long as the page
        listener.forget();
    }
}

/// Shows `text` in the info panel, if the page has one.
pub fn show_artwork_info(text: &str) {
    let Some(panel) = document()
        .and_then(|document| document.get_element_by_id(ART_INFO_ID))
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    panel.set_text_content(Some(text));
    let _ = panel.style().set_property("display", "block");
}
