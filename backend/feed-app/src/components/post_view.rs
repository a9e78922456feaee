use chrono::{DateTime, Utc};

use crate::models::PostWithAuthor;
use crate::time::from_now;
use crate::view::{Element, Node};

pub const AVATAR_SIZE: u32 = 56;

/// One feed item
///
/// Pure: the same item and `now` always give the same markup.
pub fn post_view(item: &PostWithAuthor, now: DateTime<Utc>) -> Node {
    let PostWithAuthor { post, author } = item;
    let profile = author.profile_href();

    let avatar = Element::new("a").attr("href", profile.clone()).child(
        Element::new("img")
            .attr("src", author.profile_picture.clone())
            .attr("alt", author.handle())
            .class("h-14 w-14 rounded-full")
            .attr("width", AVATAR_SIZE.to_string())
            .attr("height", AVATAR_SIZE.to_string()),
    );

    let byline = Element::new("div")
        .class("flex gap-1 text-slate-300")
        .child(
            Element::new("a")
                .attr("href", profile)
                .child(Element::new("span").text(author.handle())),
        )
        .child(
            Element::new("a").attr("href", post.permalink()).child(
                Element::new("span")
                    .class("font-thin")
                    .text(format!(" · {}", from_now(post.created_at, now))),
            ),
        );

    Element::new("div")
        .class("flex gap-3 border-b border-slate-400 p-4")
        .attr("data-post-id", post.id.clone())
        .child(avatar)
        .child(
            Element::new("div")
                .class("flex flex-col")
                .child(byline)
                .child(Element::new("span").class("text-2xl").text(post.content.clone())),
        )
        .into()
}
