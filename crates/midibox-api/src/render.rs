//! Server-side HTML for the index page.
//!
//! One page carries everything: the genre filter, the file table with
//! download links, and the upload form. Every catalog value is escaped
//! before it is written into markup.

use midibox_db::Listing;

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the index page for a listing.
pub fn render_index(listing: &Listing, genre_required: bool) -> String {
    let selected = listing.filter.selected();
    let mut html = String::with_capacity(2048);

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n<title>MIDI Files</title>\n</head>\n<body>\n\
         <h1>MIDI Files</h1>\n",
    );

    // Filter
    html.push_str("<form method=\"get\" action=\"/\">\n<label for=\"genre-filter\">Genre</label>\n");
    html.push_str("<select id=\"genre-filter\" name=\"genre\" onchange=\"this.form.submit()\">\n");
    html.push_str(&format!(
        "<option value=\"\"{}>All</option>\n",
        if selected.is_none() { " selected" } else { "" }
    ));
    for genre in &listing.genres {
        let escaped = escape_html(genre);
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escaped,
            if selected == Some(genre.as_str()) { " selected" } else { "" },
            escaped
        ));
    }
    html.push_str("</select>\n<button type=\"submit\">Filter</button>\n</form>\n");

    // Files
    if listing.files.is_empty() {
        html.push_str("<p>No files uploaded yet.</p>\n");
    } else {
        html.push_str(
            "<table>\n<thead><tr><th>Filename</th><th>Genre</th><th></th></tr></thead>\n<tbody>\n",
        );
        for file in &listing.files {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td><a href=\"/download/{}\">Download</a></td></tr>\n",
                escape_html(&file.filename),
                escape_html(file.genre_label()),
                file.id
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    // Upload
    html.push_str(
        "<h2>Upload</h2>\n\
         <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\" accept=\".mid,.midi\" required>\n",
    );
    html.push_str(&format!(
        "<input type=\"text\" name=\"genre\" list=\"known-genres\" maxlength=\"{}\" placeholder=\"Genre\"{}>\n",
        midibox_core::defaults::MAX_GENRE_LEN,
        if genre_required { " required" } else { "" }
    ));
    html.push_str("<datalist id=\"known-genres\">\n");
    for genre in &listing.genres {
        html.push_str(&format!("<option value=\"{}\">\n", escape_html(genre)));
    }
    html.push_str(
        "</datalist>\n<button type=\"submit\">Upload</button>\n</form>\n</body>\n</html>\n",
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use midibox_core::{GenreFilter, MidiFile};

    fn file(id: i32, filename: &str, genre: Option<&str>) -> MidiFile {
        MidiFile {
            id,
            filename: filename.to_string(),
            genre: genre.map(str::to_string),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_lists_files_with_links() {
        let listing = Listing {
            files: vec![file(1, "song1.mid", Some("rock")), file(2, "song2.mid", Some("jazz"))],
            genres: vec!["jazz".to_string(), "rock".to_string()],
            filter: GenreFilter::All,
        };
        let html = render_index(&listing, true);

        assert!(html.contains("<td>song1.mid</td><td>rock</td>"));
        assert!(html.contains("href=\"/download/1\""));
        assert!(html.contains("href=\"/download/2\""));
        assert!(html.contains("<option value=\"\" selected>All</option>"));
        assert!(html.contains("<option value=\"jazz\">jazz</option>"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"genre\" list=\"known-genres\" maxlength=\"50\" placeholder=\"Genre\" required>"));
    }

    #[test]
    fn test_render_marks_selected_genre() {
        let listing = Listing {
            files: vec![file(2, "song2.mid", Some("jazz"))],
            genres: vec!["jazz".to_string(), "rock".to_string()],
            filter: GenreFilter::Exact("jazz".to_string()),
        };
        let html = render_index(&listing, true);

        assert!(html.contains("<option value=\"jazz\" selected>jazz</option>"));
        assert!(html.contains("<option value=\"\">All</option>"));
        assert!(!html.contains("song1.mid"));
    }

    #[test]
    fn test_render_empty_catalog() {
        let listing = Listing {
            files: vec![],
            genres: vec![],
            filter: GenreFilter::All,
        };
        let html = render_index(&listing, false);
        assert!(html.contains("No files uploaded yet."));
        assert!(!html.contains(" required>\n<datalist"));
    }

    #[test]
    fn test_render_escapes_catalog_values() {
        let listing = Listing {
            files: vec![file(3, "a.mid", Some("<script>"))],
            genres: vec!["<script>".to_string()],
            filter: GenreFilter::All,
        };
        let html = render_index(&listing, true);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_untagged_file() {
        let listing = Listing {
            files: vec![file(4, "loose.mid", None)],
            genres: vec![],
            filter: GenreFilter::All,
        };
        let html = render_index(&listing, false);
        assert!(html.contains("<td>loose.mid</td><td></td>"));
    }
}
