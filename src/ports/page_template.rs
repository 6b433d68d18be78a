//! Page Boilerplate
//!
//! Static head and foot wrapped around the rendered outline: the stylesheet
//! that hides nested lists and the script that toggles them on click.

use std::fmt::Write;

use serde::Deserialize;

/// Texts shown around the outline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Document `<title>`
    pub title: String,
    /// Heading above the outline
    pub heading: String,
    /// Paragraph below the heading
    pub intro: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Tree View".to_string(),
            heading: "Tree View".to_string(),
            intro: "Click on the arrow(s) to open or close the tree branches.".to_string(),
        }
    }
}

const STYLE: &str = r#"<style>
ul, #myUL {
  list-style-type: none;
}

#myUL {
  margin: 0;
  padding: 0;
}

.caret {
  cursor: pointer;
  -webkit-user-select: none; /* Safari 3.1+ */
  -moz-user-select: none; /* Firefox 2+ */
  -ms-user-select: none; /* IE 10+ */
  user-select: none;
}

.caret::before {
  content: "\25B6";
  color: black;
  display: inline-block;
  margin-right: 6px;
}

.caret-rotated::before {
  -ms-transform: rotate(90deg); /* IE 9 */
  -webkit-transform: rotate(90deg); /* Safari */
  transform: rotate(90deg);
}

.nested {
  display: none;
}

.nested-visible {
  display: block;
}
</style>
"#;

/// Toggle script and closing tags placed after the outline.
pub const FOOT: &str = r#"<script>
var toggler = document.getElementsByClassName("caret");
var i;

for (i = 0; i < toggler.length; i++) {
  toggler[i].addEventListener("click", function() {
    this.parentElement.querySelector(".nested").classList.toggle("nested-visible");
    this.classList.toggle("caret-rotated");
  });
}
</script>

</body>
</html>
"#;

/// Everything up to the opening of the outline list.
pub fn head(page: &PageConfig) -> String {
    let mut out = String::with_capacity(STYLE.len() + 512);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&page.title));
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n\n");
    let _ = writeln!(out, "<h2>{}</h2>", escape_html(&page.heading));
    let _ = writeln!(out, "<p>{}</p>\n", escape_html(&page.intro));
    out
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
