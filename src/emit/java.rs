use super::{CodeWriter, Formatter, Unit};

pub struct Java;

impl Formatter for Java {
    fn comment(&self) -> &'static str {
        "//"
    }

    fn render(&self, unit: &Unit, w: &mut CodeWriter) {
        w.block(format!("public class {} {{", unit.class_name), "}", |w| {
            for i in 0..unit.section_count() {
                w.line(format!("private double z1_{i} = 0.0;"));
                w.line(format!("private double z2_{i} = 0.0;"));
            }
            w.blank();

            w.block("public double process(double inputSample) {", "}", |w| {
                w.line("double output = inputSample;");
                for (i, c) in unit.literals() {
                    w.blank();
                    w.line(format!("// Biquad section {i}"));
                    w.line(format!(
                        "double x{i} = output - ({} * this.z1_{i}) - ({} * this.z2_{i});",
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
            });
            w.blank();

            w.block("public void reset() {", "}", |w| {
                for i in 0..unit.section_count() {
                    w.line(format!("this.z1_{i} = 0.0;"));
                    w.line(format!("this.z2_{i} = 0.0;"));
                }
            });
        });
    }

    fn usage(&self, unit: &Unit) -> Vec<String> {
        let name = unit.class_name;
        vec![
            "Example usage:".to_string(),
            format!("{name} filter = new {name}();"),
            "double filtered = filter.process(sample);".to_string(),
        ]
    }
}
