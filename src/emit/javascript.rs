use super::{CodeWriter, Formatter, Unit};

pub struct Javascript;

pub(super) fn zero_state(unit: &Unit, w: &mut CodeWriter) {
    for i in 0..unit.section_count() {
        w.line(format!("this.z1_{i} = 0.0;"));
        w.line(format!("this.z2_{i} = 0.0;"));
    }
}

/// Body of `process`, shared with TypeScript which only adds a type annotation
pub(super) fn process_body(unit: &Unit, w: &mut CodeWriter, keyword: &str, annotation: &str) {
    for (i, c) in unit.literals() {
        w.blank();
        w.line(format!("// Biquad section {i}"));
        w.line(format!(
            "{keyword} x{i}{annotation} = output - ({} * this.z1_{i}) - ({} * this.z2_{i});",
            c.a1, c.a2
        ));
        w.line(format!(
            "output = {} * x{i} + {} * this.z1_{i} + {} * this.z2_{i};",
            c.b0, c.b1, c.b2
        ));
        w.line(format!("this.z2_{i} = this.z1_{i};"));
        w.line(format!("this.z1_{i} = x{i};"));
    }
    w.blank();
    w.line("return output;");
}

impl Formatter for Javascript {
    fn comment(&self) -> &'static str {
        "//"
    }

    fn render(&self, unit: &Unit, w: &mut CodeWriter) {
        w.block(format!("class {} {{", unit.class_name), "}", |w| {
            w.block("constructor() {", "}", |w| {
                w.line("// Initialize state variables for each biquad section");
                zero_state(unit, w);
            });
            w.blank();

            w.block("process(inputSample) {", "}", |w| {
                w.line("let output = inputSample;");
                process_body(unit, w, "let", "");
            });
            w.blank();

            w.block("reset() {", "}", |w| zero_state(unit, w));
        });
    }

    fn usage(&self, unit: &Unit) -> Vec<String> {
        let name = unit.class_name;
        vec![
            "Example usage:".to_string(),
            format!("const filter = new {name}();"),
            "const filtered = filter.process(sample);".to_string(),
            String::new(),
            "One instance per channel:".to_string(),
            format!("const filters = [0, 1, 2].map(() => new {name}());"),
        ]
    }
}
