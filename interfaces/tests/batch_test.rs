use interfaces::{OutputBatch, ResultFragment, STYLE};

fn fragment(title: &str, summary: &str) -> ResultFragment {
    ResultFragment {
        link: "https://blog.example.com/post?id=1&ref=rss".to_string(),
        title: title.to_string(),
        published: "Sun, 10 Mar 2024 09:30:00 +0000".to_string(),
        summary: summary.to_string(),
    }
}

#[test]
fn fragment_html_uses_layout_classes_and_escapes() {
    let html = fragment("<script> in title", "Patch now").to_html();

    assert!(html.starts_with("<div class=\"paragraph-container\"><div class=\"title\">"));
    assert!(html.contains("href=\"https://blog.example.com/post?id=1&amp;ref=rss\""));
    assert!(html.contains("&lt;script&gt; in title"));
    assert!(html.contains("<div class=\"date\">Sun, 10 Mar 2024 09:30:00 +0000</div><br>"));
    assert!(html.contains("<div class=\"text\"><pre>Patch now</pre></div></div>"));
}

#[test]
fn empty_batch_is_not_deliverable() {
    let batch = OutputBatch::new();
    assert!(batch.is_empty());
    assert!(!batch.is_deliverable(150));
    assert_eq!(batch.render_fragments_page(), STYLE);
}

#[test]
fn deliverable_only_above_threshold() {
    let mut batch = OutputBatch::new();
    batch.push(fragment("A", "B"));
    let size = batch.content_chars();

    assert!(batch.is_deliverable(size - 1));
    assert!(!batch.is_deliverable(size));
}

#[test]
fn summary_section_goes_first_and_bullets_break() {
    let mut batch = OutputBatch::new();
    batch.push(fragment("Kernel LPE", "**Impact** local root"));
    batch.set_overall_summary("**One** kernel bug");

    let html = batch.render_html();
    assert!(html.starts_with(STYLE));
    let summary_at = html.find("<h2>Summary</h2>").unwrap();
    let fragment_at = html.find("Kernel LPE").unwrap();
    assert!(summary_at < fragment_at);
    assert_eq!(html.matches("<br>\n**").count(), 4);
}

#[test]
fn text_rendering_lists_fragments() {
    let mut batch = OutputBatch::new();
    batch.push(fragment("Kernel LPE", "local root"));
    batch.set_overall_summary("One kernel bug");

    let text = batch.render_text();
    assert!(text.starts_with("Summary\nOne kernel bug\n\n"));
    assert!(text.contains("Kernel LPE\nhttps://blog.example.com/post?id=1&ref=rss\n"));
    assert_eq!(batch.len(), 1);
}
