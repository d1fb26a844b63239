use super::{CodeWriter, Formatter, Unit};

pub struct Cpp;

impl Formatter for Cpp {
    fn comment(&self) -> &'static str {
        "//"
    }

    fn render(&self, unit: &Unit, w: &mut CodeWriter) {
        w.line(format!("class {} {{", unit.class_name));
        w.line("private:");
        w.indented(|w| {
            w.line("struct BiquadState { double z1 = 0, z2 = 0; };");
            for i in 0..unit.section_count() {
                w.line(format!("BiquadState state{i};"));
            }
        });
        w.blank();

        w.line("public:");
        w.indented(|w| {
            w.block("double process(double input) {", "}", |w| {
                w.line("double output = input;");
                for (i, c) in unit.literals() {
                    w.blank();
                    w.line(format!("// Biquad section {i}"));
                    w.line(format!(
                        "double x{i} = output - ({} * state{i}.z1) - ({} * state{i}.z2);",
                        c.a1, c.a2
                    ));
                    w.line(format!(
                        "output = {} * x{i} + {} * state{i}.z1 + {} * state{i}.z2;",
                        c.b0, c.b1, c.b2
                    ));
                    w.line(format!("state{i}.z2 = state{i}.z1;"));
                    w.line(format!("state{i}.z1 = x{i};"));
                }
                w.blank();
                w.line("return output;");
            });
            w.blank();

            w.block("void reset() {", "}", |w| {
                for i in 0..unit.section_count() {
                    w.line(format!("state{i}.z1 = state{i}.z2 = 0;"));
                }
            });
        });
        w.line("};");
    }

    fn usage(&self, unit: &Unit) -> Vec<String> {
        let name = unit.class_name;
        vec![
            "Example usage:".to_string(),
            format!("{name} filter;"),
            "double filtered = filter.process(sample);".to_string(),
            String::new(),
            "One instance per channel:".to_string(),
            format!("{name} filters[3];"),
            "double filtered_1 = filters[0].process(raw1);".to_string(),
        ]
    }
}
