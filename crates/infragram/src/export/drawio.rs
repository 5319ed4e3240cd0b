//! draw.io XML backend.
//!
//! The document is a single uncompressed page:
//!
//! ```text
//! <mxfile host=..>
//!   <diagram name=..>
//!     <mxGraphModel ..>
//!       <root>
//!         <mxCell id="0"/>
//!         <mxCell id="1" parent="0"/>
//!         containers, then shapes, then connectors
//! ```

use std::io::Write;

use log::{debug, info};
use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};

use infragram_core::{
    diagram::{Connector, Container, Shape},
    geometry::{Point, Size},
};

use super::{Error, Exporter};
use crate::{config::StyleConfig, diagram::Diagram};

/// Id of the root cell every top-level cell is parented to.
const LAYER_CELL: &str = "1";

/// Writes diagrams as draw.io XML to any [`Write`] sink.
pub struct DrawioExporter<W: Write> {
    writer: Writer<W>,
    diagram_name: String,
    host: String,
}

impl<W: Write> DrawioExporter<W> {
    pub fn new(inner: W, style: &StyleConfig) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            diagram_name: style.diagram_name().to_string(),
            host: style.host().to_string(),
        }
    }

    /// Consumes the exporter and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.writer
            .write_event(event)
            .map_err(|err| Error::Write(err.to_string()))
    }

    fn open(&mut self, element: BytesStart<'_>) -> Result<(), Error> {
        self.event(Event::Start(element))
    }

    fn close(&mut self, name: &str) -> Result<(), Error> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn write_container(&mut self, container: &Container) -> Result<(), Error> {
        self.write_vertex(
            container.id(),
            container.label(),
            container.style(),
            container.parent(),
            container.position(),
            container.size(),
        )
    }

    fn write_shape(&mut self, shape: &Shape) -> Result<(), Error> {
        self.write_vertex(
            shape.id(),
            shape.label(),
            shape.style(),
            shape.parent(),
            shape.position(),
            shape.size(),
        )
    }

    fn write_vertex(
        &mut self,
        id: &str,
        label: &str,
        style: &str,
        parent: Option<&str>,
        position: Point,
        size: Size,
    ) -> Result<(), Error> {
        let mut cell = BytesStart::new("mxCell");
        cell.push_attribute(("id", id));
        push_label(&mut cell, label);
        cell.push_attribute(("style", style));
        cell.push_attribute(("vertex", "1"));
        cell.push_attribute(("parent", parent.unwrap_or(LAYER_CELL)));
        self.open(cell)?;

        let x = position.x().to_string();
        let y = position.y().to_string();
        let width = size.width().to_string();
        let height = size.height().to_string();
        let geometry = BytesStart::new("mxGeometry").with_attributes([
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("as", "geometry"),
        ]);
        self.event(Event::Empty(geometry))?;

        self.close("mxCell")
    }

    fn write_connector(&mut self, connector: &Connector) -> Result<(), Error> {
        let mut cell = BytesStart::new("mxCell");
        cell.push_attribute(("id", connector.id()));
        push_label(&mut cell, connector.label());
        cell.push_attribute(("style", connector.style()));
        cell.push_attribute(("edge", "1"));
        cell.push_attribute(("parent", LAYER_CELL));
        cell.push_attribute(("source", connector.source()));
        cell.push_attribute(("target", connector.target()));
        self.open(cell)?;

        let geometry =
            BytesStart::new("mxGeometry").with_attributes([("relative", "1"), ("as", "geometry")]);
        self.event(Event::Empty(geometry))?;

        self.close("mxCell")
    }
}

/// Adds a `value` attribute, keeping line breaks as character references so
/// they survive attribute-value normalization. Characters XML 1.0 does not
/// allow are dropped.
fn push_label(cell: &mut BytesStart<'_>, label: &str) {
    let allowed: String = label.chars().filter(|&c| is_xml_char(c)).collect();
    let escaped = escape(allowed.as_str()).replace('\n', "&#xa;");
    cell.push_attribute((b"value".as_slice(), escaped.as_bytes()));
}

fn is_xml_char(c: char) -> bool {
    !matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

impl<W: Write> Exporter for DrawioExporter<W> {
    fn export_diagram(&mut self, diagram: &Diagram) -> Result<(), Error> {
        info!(
            containers = diagram.containers().len(),
            shapes = diagram.shapes().len(),
            connectors = diagram.connectors().len();
            "Writing draw.io document"
        );

        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let host = self.host.clone();
        let name = self.diagram_name.clone();
        self.open(BytesStart::new("mxfile").with_attributes([("host", host.as_str())]))?;
        self.open(BytesStart::new("diagram").with_attributes([("name", name.as_str())]))?;
        self.open(BytesStart::new("mxGraphModel").with_attributes([
            ("dx", "1422"),
            ("dy", "794"),
            ("grid", "1"),
            ("gridSize", "10"),
        ]))?;
        self.open(BytesStart::new("root"))?;

        self.event(Event::Empty(
            BytesStart::new("mxCell").with_attributes([("id", "0")]),
        ))?;
        self.event(Event::Empty(
            BytesStart::new("mxCell").with_attributes([("id", LAYER_CELL), ("parent", "0")]),
        ))?;

        for container in diagram.containers() {
            self.write_container(container)?;
        }
        for shape in diagram.shapes() {
            self.write_shape(shape)?;
        }
        for connector in diagram.connectors() {
            self.write_connector(connector)?;
        }

        self.close("root")?;
        self.close("mxGraphModel")?;
        self.close("diagram")?;
        self.close("mxfile")?;
        self.writer.get_mut().flush()?;

        debug!("draw.io document complete");
        Ok(())
    }
}
