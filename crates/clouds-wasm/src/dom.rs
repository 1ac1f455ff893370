//! DOM painting: one absolutely-positioned button per entity.
//!
//! Elements are created once at mount. Each frame only rewrites `left` and
//! `top` on the elements whose ids came out of the scheduler flush.

use clouds_render::{Content, ElementPaint};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

pub const ENTITY_ATTR: &str = "data-entity";

fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}

/// Style the mount root as the drag surface.
pub fn prepare_root(root: &HtmlElement, background: Option<&str>) -> Result<(), JsValue> {
    set_styles(root, &[("position", "relative"), ("min-height", "100vh")])?;
    if let Some(url) = background {
        let image = format!("url('{url}')");
        set_styles(
            root,
            &[
                ("background-image", image.as_str()),
                ("background-size", "cover"),
                ("background-position", "center"),
            ],
        )?;
    }
    Ok(())
}

/// Create the element for `paint` and append it to `root`.
pub fn create_element(
    document: &Document,
    root: &HtmlElement,
    paint: &ElementPaint,
) -> Result<HtmlElement, JsValue> {
    let element: HtmlElement = document.create_element("button")?.dyn_into()?;
    element.set_attribute(ENTITY_ATTR, paint.id.as_str())?;
    set_styles(&element, &[("position", "absolute"), ("cursor", "move")])?;

    match &paint.content {
        Content::Image { url, width, height } => {
            let image = format!("url('{url}')");
            let (w, h) = (format!("{width}px"), format!("{height}px"));
            set_styles(
                &element,
                &[
                    ("background-image", image.as_str()),
                    ("background-size", "cover"),
                    ("background-position", "center"),
                    ("background-color", "transparent"),
                    ("border", "none"),
                    ("width", w.as_str()),
                    ("height", h.as_str()),
                ],
            )?;
            element.set_text_content(Some(""));
        }
        Content::Label { text, .. } => element.set_text_content(Some(text.as_str())),
    }

    place(&element, paint)?;
    root.append_child(&element)?;
    Ok(element)
}

/// Move `element` to the painted offset.
pub fn place(element: &HtmlElement, paint: &ElementPaint) -> Result<(), JsValue> {
    let (left, top) = paint.css_offset();
    set_styles(element, &[("left", left.as_str()), ("top", top.as_str())])
}
