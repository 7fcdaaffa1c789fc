use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    platform::{FetchOutcome, MediaItem, PostResult, Preview, StoryResult},
    service::session::{Flash, FlashLevel},
};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
form fieldset { border: 1px solid #ddd; border-radius: 6px; margin-bottom: 1rem; }
input[type=text] { width: 100%; padding: .5rem; box-sizing: border-box; }
.flash { padding: .75rem 1rem; border-radius: 6px; margin-bottom: .5rem; }
.flash-error { background: #fdecea; color: #8a1c12; }
.flash-info { background: #e8f1fd; color: #0d3c78; }
.grid { display: flex; flex-wrap: wrap; gap: 1rem; }
.item { border: 1px solid #ddd; border-radius: 6px; padding: .5rem; width: 210px; text-align: center; }
.item img { max-width: 200px; max-height: 200px; }
.preview-error { display: block; color: #8a1c12; font-size: .85rem; min-height: 3rem; }
.meta { color: #555; font-size: .85rem; }
"#;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn path_segment(input: &str) -> String {
    utf8_percent_encode(input, PATH_SEGMENT).to_string()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn render_flashes(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|flash| {
            let class = match flash.level {
                FlashLevel::Info => "flash flash-info",
                FlashLevel::Error => "flash flash-error",
            };
            format!("<div class=\"{}\">{}</div>\n", class, escape_html(&flash.message))
        })
        .collect()
}

pub fn render_index(flashes: &[Flash]) -> String {
    let body = format!(
        r#"<h1>Instagram Downloader</h1>
{}
<form method="post" action="/fetch">
<fieldset>
<legend><label><input type="radio" name="fetch_type" value="url" checked> Post / Reel URL</label></legend>
<input type="text" name="url" placeholder="https://www.instagram.com/p/...">
</fieldset>
<fieldset>
<legend><label><input type="radio" name="fetch_type" value="stories"> Stories by username</label></legend>
<input type="text" name="username" placeholder="username">
</fieldset>
<button type="submit">Fetch</button>
</form>"#,
        render_flashes(flashes)
    );

    layout("Instagram Downloader", &body)
}

fn render_preview(item: &MediaItem) -> String {
    match &item.preview {
        Preview::Ready(data_uri) => format!(
            "<img src=\"{}\" alt=\"Preview {}\">",
            escape_html(data_uri),
            item.index + 1
        ),
        Preview::Failed(message) => format!("<span class=\"preview-error\">{}</span>", escape_html(message)),
        Preview::Pending => "<span class=\"preview-error\">Preview unavailable</span>".to_string(),
    }
}

fn render_item(item: &MediaItem, href: &str, extra: &str) -> String {
    format!(
        "<div class=\"item\">\n{}\n<div class=\"meta\">{}{}</div>\n<a href=\"{}\" download>Download</a>\n</div>\n",
        render_preview(item),
        item.media_type(),
        extra,
        escape_html(href)
    )
}

fn render_post(post: &PostResult) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>@{}</h1>\n<p class=\"meta\">Likes: {} &middot; Type: {}</p>\n<p title=\"{}\">{}</p>\n<div class=\"grid\">\n",
        escape_html(&post.username),
        escape_html(&post.likes_display()),
        post.kind,
        escape_html(&post.full_caption),
        escape_html(&post.caption)
    );

    for item in &post.media_items {
        let href = format!("/download_item/{}/{}", path_segment(&post.shortcode), item.index);
        body.push_str(&render_item(item, &href, ""));
    }

    body.push_str("</div>\n");
    body
}

fn render_story(story: &StoryResult) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>Stories of @{}</h1>\n<div class=\"grid\">\n",
        escape_html(&story.username)
    );

    for story_item in &story.story_items {
        let href = format!(
            "/download_story_item/{}/{}",
            path_segment(&story.username),
            story_item.item.index
        );
        let taken = match story_item.taken_at {
            Some(taken_at) => format!(
                " &middot; <time datetime=\"{}\">{}</time>",
                taken_at.to_rfc3339(),
                escape_html(&story_item.taken_at_relative)
            ),
            None => format!(" &middot; {}", escape_html(&story_item.taken_at_relative)),
        };
        body.push_str(&render_item(&story_item.item, &href, &taken));
    }

    body.push_str("</div>\n");
    body
}

pub fn render_results(outcome: &FetchOutcome) -> String {
    let content = match outcome {
        FetchOutcome::Post(post) => render_post(post),
        FetchOutcome::Story(story) => render_story(story),
    };

    layout("Results", &format!("{}<p><a href=\"/\">Fetch another</a></p>", content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{PostKind, StoryItem};
    use url::Url;

    fn item(index: usize, preview: Preview) -> MediaItem {
        MediaItem {
            index,
            is_video: index % 2 == 1,
            download_url: Url::parse("https://cdn.example.com/secret-token.jpg").unwrap(),
            preview_url: Url::parse("https://cdn.example.com/p.jpg").unwrap(),
            preview,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>'"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;&#x27;"
        );
    }

    #[test]
    fn test_index_shows_flashes_escaped() {
        let html = render_index(&[Flash::error("bad <input>"), Flash::info("fyi")]);
        assert!(html.contains("<div class=\"flash flash-error\">bad &lt;input&gt;</div>"));
        assert!(html.contains("<div class=\"flash flash-info\">fyi</div>"));
        assert!(html.contains("name=\"fetch_type\" value=\"stories\""));
    }

    #[test]
    fn test_post_results_link_through_server() {
        let post = PostResult {
            shortcode: "ABC123".into(),
            username: "someone".into(),
            likes: None,
            kind: PostKind::Sidecar,
            full_caption: "full <b>caption</b>".into(),
            caption: "full <b>caption</b>".into(),
            media_items: vec![
                item(0, Preview::Ready("data:image/jpeg;base64,AAAA".into())),
                item(1, Preview::Failed("Network error fetching preview: boom".into())),
            ],
        };

        let html = render_results(&FetchOutcome::Post(post));
        assert!(html.contains("href=\"/download_item/ABC123/0\""));
        assert!(html.contains("href=\"/download_item/ABC123/1\""));
        assert!(html.contains("src=\"data:image/jpeg;base64,AAAA\""));
        assert!(html.contains("Network error fetching preview: boom"));
        assert!(html.contains("Likes: N/A"));
        assert!(html.contains("GraphSidecar"));
        assert!(html.contains("full &lt;b&gt;caption&lt;/b&gt;"));
        assert!(!html.contains("secret-token"));
    }

    #[test]
    fn test_story_results() {
        let story = StoryResult {
            username: "jo.hn_42".into(),
            story_items: vec![StoryItem {
                item: item(0, Preview::Ready("data:image/jpeg;base64,BBBB".into())),
                taken_at: None,
                taken_at_relative: "Unknown time".into(),
            }],
        };

        let html = render_results(&FetchOutcome::Story(story));
        assert!(html.contains("href=\"/download_story_item/jo.hn_42/0\""));
        assert!(html.contains("Unknown time"));
    }
}
