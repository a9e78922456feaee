use crate::view::{Element, Node};

/// Centered, bordered main column
pub fn page_layout(children: impl IntoIterator<Item = Node>) -> Node {
    Element::new("main")
        .class("flex h-screen justify-center")
        .child(
            Element::new("div")
                .class("h-full w-full overflow-y-scroll border-x border-slate-400 md:max-w-2xl")
                .children(children),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_wraps_children_in_column() {
        let html = page_layout(vec![Node::text("hello")]).render_html();
        assert_eq!(
            html,
            "<main class=\"flex h-screen justify-center\">\
             <div class=\"h-full w-full overflow-y-scroll border-x border-slate-400 md:max-w-2xl\">\
             hello</div></main>"
        );
    }
}
