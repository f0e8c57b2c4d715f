use std::fmt::Display;
use std::io::{self, Write};

use fclview::{Host, PrinterRegistry};
use tracing::warn;

/// Write `name = ...` for one value, followed by its elements if a printer
/// in `registry` handles it.
///
/// At most `limit` elements are written. If more remain, a `...` line is
/// added. Values that no printer handles, or whose printer could not be
/// constructed, are written using their generic rendering.
pub fn render_value<H: Host, W: Write>(
    out: &mut W,
    registry: &PrinterRegistry<H>,
    host: &H,
    name: &str,
    value: &H::Value,
    limit: usize,
) -> io::Result<()>
where
    H::Value: Display,
{
    let printer = match registry.lookup(host, value) {
        Some(Ok(printer)) => printer,
        Some(Err(err)) => {
            warn!(name, %err, "cannot display array, showing raw value");
            return writeln!(out, "{} = {}", name, value);
        }
        None => return writeln!(out, "{} = {}", name, value),
    };

    writeln!(out, "{} = {}", name, printer.summary())?;

    let mut children = printer.children();
    for (label, elem) in children.by_ref().take(limit) {
        match elem {
            Ok(elem) => writeln!(out, "  [{}] = {}", label, elem)?,
            Err(err) => writeln!(out, "  [{}] = <error: {}>", label, err)?,
        }
    }
    if children.next().is_some() {
        writeln!(out, "  ...")?;
    }

    Ok(())
}

/// Render each of `values` in order.
pub fn render_all<'v, H: Host + 'v, W: Write>(
    out: &mut W,
    registry: &PrinterRegistry<H>,
    host: &H,
    values: impl IntoIterator<Item = (&'v str, &'v H::Value)>,
    limit: usize,
) -> io::Result<()>
where
    H::Value: Display,
{
    for (name, value) in values {
        render_value(out, registry, host, name, value, limit)?;
    }
    Ok(())
}
