//! Deferred page output: external scripts and footer snippets registered while
//! the body is rendered, emitted once the body is done.

use super::escape::esc_attr;

pub trait RenderScheduler {
    /// Registers an external script. Repeated handles are emitted once.
    fn enqueue_script(&mut self, handle: &str, src: &str);

    /// Queues inline markup for the footer. Lower priorities come first.
    fn defer_footer(&mut self, priority: i32, markup: String);
}

#[derive(Debug, Default)]
pub struct FooterQueue {
    scripts: Vec<(String, String)>,
    footer: Vec<(i32, String)>,
}

impl FooterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.footer.is_empty()
    }

    /// Consumes the queue: script tags in enqueue order, then footer markup by
    /// priority (ties keep registration order).
    pub fn render(mut self) -> String {
        let mut out = String::new();
        for (handle, src) in &self.scripts {
            out.push_str(&format!(
                "<script type=\"text/javascript\" id=\"{}-js\" src=\"{}\"></script>\n",
                esc_attr(handle),
                esc_attr(src)
            ));
        }
        self.footer.sort_by_key(|(priority, _)| *priority);
        for (_, markup) in self.footer {
            out.push_str(&markup);
            out.push('\n');
        }
        out
    }
}

impl RenderScheduler for FooterQueue {
    fn enqueue_script(&mut self, handle: &str, src: &str) {
        if self.scripts.iter().any(|(h, _)| h == handle) {
            return;
        }
        self.scripts.push((handle.to_string(), src.to_string()));
    }

    fn defer_footer(&mut self, priority: i32, markup: String) {
        self.footer.push((priority, markup));
    }
}
