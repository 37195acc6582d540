// File: src/translator/document.rs
//
// Append-only PlantUML activity document. One per translation.

/// Text of an activity diagram under construction
#[derive(Debug)]
pub struct Document {
    text: String,
}

impl Document {
    /// Starts a document whose flow opens with an action named `entry_label`
    pub fn begin(entry_label: &str) -> Self {
        let mut doc = Document { text: String::new() };
        doc.line("@startuml");
        doc.line("start");
        doc.action(entry_label);
        doc
    }

    /// Appends inline text
    pub fn push(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Appends `text` and ends the line
    pub fn line(&mut self, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
    }

    /// `:text;` on a line of its own
    pub fn action(&mut self, text: &str) {
        self.push(":");
        self.push(text);
        self.line(";");
    }

    pub fn finish(mut self) -> String {
        self.line("@enduml");
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::begin("main");
        assert_eq!(doc.finish(), "@startuml\nstart\n:main;\n@enduml\n");
    }

    #[test]
    fn test_inline_text_joins_lines() {
        let mut doc = Document::begin("f");
        doc.push("if (");
        doc.push("ok");
        doc.line(") then (yes)");
        doc.line("endif");
        assert!(doc.finish().ends_with(":f;\nif (ok) then (yes)\nendif\n@enduml\n"));
    }
}
