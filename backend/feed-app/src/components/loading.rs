use crate::view::{Element, Node};

pub const DEFAULT_SPINNER_SIZE: u32 = 16;

/// Spinning ring, `size` pixels wide
pub fn loading_spinner(size: u32) -> Node {
    let size = size.to_string();

    Element::new("div")
        .attr("role", "status")
        .child(
            Element::new("svg")
                .attr("aria-hidden", "true")
                .class("animate-spin fill-slate-300 text-gray-200")
                .attr("width", size.clone())
                .attr("height", size)
                .attr("viewBox", "0 0 100 101"),
        )
        .child(Element::new("span").class("sr-only").text("Loading..."))
        .into()
}

/// Spinner centered over the whole viewport
pub fn loading_page() -> Node {
    Element::new("div")
        .class("absolute right-0 top-0 flex h-screen w-screen items-center justify-center")
        .attr("data-testid", "loading-page")
        .child(loading_spinner(60))
        .into()
}
