use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::defs::ResultFragment;

/// Styling shipped at the top of every HTML batch.
pub const STYLE: &str = r#"
    <style>
        body {
            font-family: Arial, sans-serif;
            margin: 40px;
            background-color: #f9f9f9;
        }
        .paragraph-container {
            margin-bottom: 40px;
            padding: 20px;
            background: white;
            border-radius: 8px;
            box-shadow: 0px 4px 8px rgba(0, 0, 0, 0.1);
        }
        .title {
            font-size: 22px;
            font-weight: bold;
            margin-bottom: 10px;
        }
        .date {
            font-size: 16px;
            color: gray;
            margin-bottom: 10px;
        }
        .text {
            position: relative;
            font-size: 16px;
            padding-bottom: 6px;
        }
        .text::after, .text::before {
            content: "";
            display: block;
            height: 3px;
            width: 100%;
            background: red;
            position: absolute;
            bottom: 0;
        }
        .text::before {
            bottom: 5px;
        }
    </style>"#;

impl ResultFragment {
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"paragraph-container\"><div class=\"title\"><a href=\"{}\">{}</a></div>\
             <div class=\"date\">{}</div><br>\
             <div class=\"text\"><pre>{}</pre></div></div>",
            encode_double_quoted_attribute(&self.link),
            encode_text(&self.title),
            encode_text(&self.published),
            encode_text(&self.summary),
        )
    }

    pub fn to_text(&self) -> String {
        format!("{}\n{}\n{}\n{}\n", self.title, self.link, self.published, self.summary)
    }
}

/// Everything collected during one run, delivered as a single unit.
#[derive(Debug, Clone, Default)]
pub struct OutputBatch {
    fragments: Vec<ResultFragment>,
    overall_summary: Option<String>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: ResultFragment) {
        self.fragments.push(fragment);
    }

    pub fn fragments(&self) -> &[ResultFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn overall_summary(&self) -> Option<&str> {
        self.overall_summary.as_deref()
    }

    pub fn set_overall_summary(&mut self, summary: impl Into<String>) {
        self.overall_summary = Some(summary.into());
    }

    /// Concatenated HTML of the fragments only.
    pub fn fragments_html(&self) -> String {
        self.fragments.iter().map(ResultFragment::to_html).collect()
    }

    /// Size of the fragment content in characters.
    pub fn content_chars(&self) -> usize {
        self.fragments_html().chars().count()
    }

    /// A batch is only worth sending when its fragment content exceeds `min_chars`.
    pub fn is_deliverable(&self, min_chars: usize) -> bool {
        self.content_chars() > min_chars
    }

    /// Styles and fragments, without the summary section.
    pub fn render_fragments_page(&self) -> String {
        format!("{}{}", STYLE, self.fragments_html())
    }

    /// Full HTML body: styles, optional summary section, fragments.
    pub fn render_html(&self) -> String {
        let mut html = String::from(STYLE);
        if let Some(summary) = &self.overall_summary {
            html.push_str(&format!(
                "<div class=\"paragraph-container\"><div class=\"title\"><h2>Summary</h2></div>\
                 <div class=\"text\"><pre>{}</pre></div></div><br><br>",
                encode_text(summary)
            ));
        }
        html.push_str(&self.fragments_html());
        // markdown bullets from the summarizer read better on their own line
        html.replace("**", "<br>\n**")
    }

    /// Plain-text rendering for channels that do not take HTML.
    pub fn render_text(&self) -> String {
        let mut text = String::new();
        if let Some(summary) = &self.overall_summary {
            text.push_str("Summary\n");
            text.push_str(summary);
            text.push_str("\n\n");
        }
        for fragment in &self.fragments {
            text.push_str(&fragment.to_text());
            text.push('\n');
        }
        text
    }
}
