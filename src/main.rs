use ansi_term::Colour::{Blue, Red};
use tracing_subscriber::{EnvFilter};

use ilk::{Config, Registry, Mapping, Value, Error, Result};

/// Builds a small hierarchy and reports what each level can see.
fn demo(registry: &mut Registry) -> Result<Vec<String>> {
    let (area, secret) = ilk::tokens(|[area, secret]: [ilk::Token; 2]| (area, secret));

    let shape = registry.define("Shape", |_, this, args| {
        this.set("name", args.first().cloned().unwrap_or_default());
        Ok(())
    });
    registry.build(Some(shape));
    registry.call_static(shape, "constant", &["SIDES".into(), 0.into()])?;
    registry.call_static(shape, "constant", &[secret.clone().into(), "hidden".into()])?;
    registry.call_static(shape, "shared", &[Mapping::from([("area", area.clone())]).into()])?;

    let circle = registry.define("Circle", move |registry, this, args| {
        registry.apply(shape, this, args)?;
        let Some(r) = args.get(1).and_then(Value::as_number) else {
            return Err(Error::body("Circle", "expected a radius"));
        };
        area.mark(this, (std::f64::consts::PI * r * r).into());
        Ok(())
    });
    registry.call_static(shape, "descend", &[circle.into()])?;
    registry.call_static(circle, "proto", &["round".into(), true.into()])?;

    let c = registry.construct(circle, &["unit".into(), 1.into()])?;
    let shared = registry.shared_tokens(circle).cloned().unwrap_or_default();
    let area = shared.get(&"area".into()).and_then(Value::as_token).and_then(|t| t.read(&c));

    Ok(vec![
        format!("{:?}", registry),
        format!("instance = {:?}", c),
        format!("instance.round = {:?}", c.get("round")),
        format!("instance.constant(\"SIDES\") = {:?}", registry.call_method(&c, "constant", &["SIDES".into()])?),
        format!("Circle.constant(secret) = {:?}", registry.call_static(circle, "constant", &[secret.into()])?),
        format!("Circle statics = {:?}", registry.statics(circle).keys()),
        format!("area via shared token = {:?}", area),
        format!("Shape.constant(\"round\") = {:?}", registry.call_static(shape, "constant", &["round".into()])?),
    ])
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let mut registry = Registry::with_config(Config::from_env());
    match demo(&mut registry) {
        Ok(lines) => for line in lines { println!("{}", Blue.paint(line)); },
        Err(e) => {
            eprintln!("{}", Red.paint(e.to_string()));
            std::process::exit(1);
        },
    }
}
