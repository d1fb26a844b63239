use super::{CodeWriter, Formatter, Unit};

pub struct Rust;

impl Formatter for Rust {
    fn comment(&self) -> &'static str {
        "//"
    }

    fn render(&self, unit: &Unit, w: &mut CodeWriter) {
        let name = unit.class_name;
        let n = unit.section_count();

        w.line("#[derive(Debug, Clone, Default)]");
        w.block(format!("pub struct {name} {{"), "}", |w| {
            w.line(format!("z1: [f64; {n}],"));
            w.line(format!("z2: [f64; {n}],"));
        });
        w.blank();

        w.block(format!("impl {name} {{"), "}", |w| {
            w.block("pub fn new() -> Self {", "}", |w| {
                w.line("Self::default()");
            });
            w.blank();

            w.block("pub fn process(&mut self, input: f64) -> f64 {", "}", |w| {
                w.line("let mut output = input;");
                for (i, c) in unit.literals() {
                    w.blank();
                    w.line(format!("// Biquad section {i}"));
                    w.line(format!(
                        "let x = output - ({} * self.z1[{i}]) - ({} * self.z2[{i}]);",
                        c.a1, c.a2
                    ));
                    w.line(format!(
                        "output = {} * x + {} * self.z1[{i}] + {} * self.z2[{i}];",
                        c.b0, c.b1, c.b2
                    ));
                    w.line(format!("self.z2[{i}] = self.z1[{i}];"));
                    w.line(format!("self.z1[{i}] = x;"));
                }
                w.blank();
                w.line("output");
            });
            w.blank();

            w.block("pub fn reset(&mut self) {", "}", |w| {
                w.line(format!("self.z1 = [0.0; {n}];"));
                w.line(format!("self.z2 = [0.0; {n}];"));
            });
        });
    }

    fn usage(&self, unit: &Unit) -> Vec<String> {
        let name = unit.class_name;
        vec![
            "Example usage:".to_string(),
            format!("let mut filter = {name}::new();"),
            "let filtered = filter.process(sample);".to_string(),
        ]
    }
}
