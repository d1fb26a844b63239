use super::{CodeWriter, Formatter, Unit};

pub struct Python;

fn zero_state(unit: &Unit, w: &mut CodeWriter) {
    for i in 0..unit.section_count() {
        w.line(format!("self.z1_{i} = 0.0"));
        w.line(format!("self.z2_{i} = 0.0"));
    }
}

impl Formatter for Python {
    fn comment(&self) -> &'static str {
        "#"
    }

    fn render(&self, unit: &Unit, w: &mut CodeWriter) {
        w.line(format!("class {}:", unit.class_name));
        w.indented(|w| {
            w.line("def __init__(self):");
            w.indented(|w| {
                w.line("# Initialize state variables for each biquad section");
                zero_state(unit, w);
            });
            w.blank();

            w.line("def process(self, input_sample):");
            w.indented(|w| {
                w.line("\"\"\"Run a single sample through the filter\"\"\"");
                w.line("output = input_sample");
                for (i, c) in unit.literals() {
                    w.blank();
                    w.line(format!("# Biquad section {i}"));
                    w.line(format!(
                        "x = output - ({} * self.z1_{i}) - ({} * self.z2_{i})",
                        c.a1, c.a2
                    ));
                    w.line(format!(
                        "output = {} * x + {} * self.z1_{i} + {} * self.z2_{i}",
                        c.b0, c.b1, c.b2
                    ));
                    w.line(format!("self.z2_{i} = self.z1_{i}"));
                    w.line(format!("self.z1_{i} = x"));
                }
                w.blank();
                w.line("return output");
            });
            w.blank();

            w.line("def reset(self):");
            w.indented(|w| {
                w.line("\"\"\"Reset filter state variables\"\"\"");
                zero_state(unit, w);
            });
        });
    }

    fn usage(&self, unit: &Unit) -> Vec<String> {
        let name = unit.class_name;
        vec![
            "Example usage:".to_string(),
            "Single channel:".to_string(),
            format!("filter = {name}()"),
            "filtered_output = filter.process(sample)".to_string(),
            String::new(),
            "Multi-channel (3 channels), one independent instance per channel:".to_string(),
            format!("filters = [{name}() for _ in range(3)]"),
            "filtered_1 = filters[0].process(raw1)".to_string(),
            "filtered_2 = filters[1].process(raw2)".to_string(),
        ]
    }
}
