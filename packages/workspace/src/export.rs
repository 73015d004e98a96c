//! Playable-lesson packaging: serialize the regional track into one
//! standalone HTML file with embedded prev/next pagination, each page
//! rendered in a sandboxed iframe.

use lessonforge_model::LessonParams;

const DEFAULT_ICON: &str = "https://cdn-icons-png.flaticon.com/512/2232/2232688.png";

/// Build the self-contained playable file. The returned string is a
/// complete HTML document valid on its own: all N pages are embedded as
/// a JSON array and navigated client-side.
pub fn playable_lesson(params: &LessonParams, pages: &[String]) -> String {
    let icon = params.custom_icon.as_deref().unwrap_or(DEFAULT_ICON);
    // Escaping "</" keeps embedded closing tags from terminating the
    // script block; the sequence is equivalent inside a JS string.
    let pages_json = serde_json::to_string(pages)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />
  <title>Lesson: {lo_code}</title>
  <style>
    body, html {{ margin: 0; padding: 0; height: 100%; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; background: #f8fafc; }}
    #app {{ display: flex; flex-direction: column; height: 100%; max-width: 800px; margin: 0 auto; background: white; position: relative; }}
    header {{ background: #fff; border-bottom: 1px solid #e2e8f0; padding: 12px 20px; display: flex; align-items: center; justify-content: space-between; height: 60px; box-sizing: border-box; }}
    .brand {{ display: flex; align-items: center; gap: 12px; font-weight: 700; color: #ea580c; font-size: 1.1rem; }}
    .brand img {{ height: 32px; width: 32px; object-fit: contain; }}
    .page-info {{ font-size: 0.9rem; color: #64748b; font-weight: 500; }}
    #content-container {{ flex: 1; position: relative; overflow: hidden; width: 100%; }}
    iframe {{ width: 100%; height: 100%; border: none; display: block; }}
    footer {{ background: #fff; border-top: 1px solid #e2e8f0; padding: 12px 20px; display: flex; justify-content: space-between; align-items: center; height: 70px; box-sizing: border-box; }}
    button {{ background: #ea580c; color: white; border: none; padding: 10px 20px; border-radius: 8px; font-size: 1rem; font-weight: 600; cursor: pointer; }}
    button:disabled {{ background: #cbd5e1; cursor: not-allowed; opacity: 0.7; }}
    button.secondary {{ background: #f1f5f9; color: #475569; }}
  </style>
</head>
<body>
  <div id="app">
    <header>
      <div class="brand">
        <img src="{icon}" alt="Logo">
        <span>{subject} Lesson</span>
      </div>
      <div class="page-info">Page <span id="current-page">1</span> / <span id="total-pages">{total}</span></div>
    </header>
    <div id="content-container"><iframe id="viewer" sandbox="allow-scripts allow-same-origin"></iframe></div>
    <footer>
      <button id="prev-btn" class="secondary" onclick="prevPage()">&larr; Prev</button>
      <button id="next-btn" onclick="nextPage()">Next &rarr;</button>
    </footer>
  </div>
  <script>
    const pages = {pages_json};
    let currentIndex = 0;
    const viewer = document.getElementById('viewer');
    const prevBtn = document.getElementById('prev-btn');
    const nextBtn = document.getElementById('next-btn');
    const pageNum = document.getElementById('current-page');
    function loadPage(index) {{
      viewer.srcdoc = pages[index];
      pageNum.textContent = index + 1;
      prevBtn.disabled = index === 0;
      nextBtn.disabled = index === pages.length - 1;
      nextBtn.innerHTML = index === pages.length - 1 ? 'Finish' : 'Next &rarr;';
    }}
    function nextPage() {{ if (currentIndex < pages.length - 1) {{ currentIndex++; loadPage(currentIndex); }} }}
    function prevPage() {{ if (currentIndex > 0) {{ currentIndex--; loadPage(currentIndex); }} }}
    loadPage(0);
  </script>
</body>
</html>
"#,
        lo_code = params.lo_code,
        subject = params.subject,
        total = pages.len(),
        icon = icon,
        pages_json = pages_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LessonParams {
        LessonParams {
            grade: "3".to_string(),
            subject: "Maths".to_string(),
            lo_code: "MT03A01".to_string(),
            learning_objective: "lo".to_string(),
            topic_outcome: "to".to_string(),
            regional_language: "Hindi".to_string(),
            context_text: None,
            source_document: None,
            custom_icon: None,
            refined_blocks: None,
        }
    }

    #[test]
    fn embeds_every_page_and_the_pagination_controls() {
        let pages = vec![
            "<html>page one</html>".to_string(),
            "<html>page two</html>".to_string(),
        ];
        let html = playable_lesson(&params(), &pages);

        assert!(html.contains("page one"));
        assert!(html.contains("page two"));
        assert!(html.contains("prev-btn"));
        assert!(html.contains("next-btn"));
        assert!(html.contains("id=\"total-pages\">2<"));
    }

    #[test]
    fn pages_render_in_a_sandboxed_frame() {
        let html = playable_lesson(&params(), &["<html>p</html>".to_string()]);
        assert!(html.contains(r#"sandbox="allow-scripts allow-same-origin""#));
    }

    #[test]
    fn page_markup_cannot_terminate_the_script_block() {
        let tricky = "<html><script>alert('x')</script></html>".to_string();
        let html = playable_lesson(&params(), &[tricky]);
        assert!(html.contains(r#"alert('x')<\/script>"#));
        assert!(!html.contains("alert('x')</script>"));
    }

    #[test]
    fn custom_icon_overrides_the_default() {
        let mut p = params();
        p.custom_icon = Some("https://example.org/icon.png".to_string());
        let html = playable_lesson(&p, &["<html>p</html>".to_string()]);
        assert!(html.contains("https://example.org/icon.png"));
        assert!(!html.contains(DEFAULT_ICON));
    }
}
