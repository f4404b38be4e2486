//! A small software 2D drawing context.
//!
//! Only axis-aligned rectangles are rasterized; everything else updates
//! state or is accepted and ignored, which is all the scenarios need.

use framelog::{
    CollaboratorError, EncodedImage, Field, Instrumentable, Method, MethodTable, SurfaceSnapshot,
    Value,
};

const NUMBER_PROPERTIES: &[&str] = &[
    "lineWidth",
    "miterLimit",
    "globalAlpha",
    "shadowBlur",
    "shadowOffsetX",
    "shadowOffsetY",
    "lineDashOffset",
];

const TEXT_PROPERTIES: &[&str] = &[
    "fillStyle",
    "strokeStyle",
    "lineCap",
    "lineJoin",
    "globalCompositeOperation",
    "font",
    "textAlign",
    "textBaseline",
    "shadowColor",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub fill_style: String,
    pub stroke_style: String,
    pub line_width: f64,
    pub line_cap: String,
    pub line_join: String,
    pub miter_limit: f64,
    pub global_alpha: f64,
    pub global_composite_operation: String,
    pub font: String,
    pub text_align: String,
    pub text_baseline: String,
    pub shadow_blur: f64,
    pub shadow_color: String,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub line_dash_offset: f64,
    pub line_dash: Vec<f64>,
    pub image_smoothing_enabled: bool,
    pub origin: (f64, f64),
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill_style: "#000000".into(),
            stroke_style: "#000000".into(),
            line_width: 1.0,
            line_cap: "butt".into(),
            line_join: "miter".into(),
            miter_limit: 10.0,
            global_alpha: 1.0,
            global_composite_operation: "source-over".into(),
            font: "10px sans-serif".into(),
            text_align: "start".into(),
            text_baseline: "alphabetic".into(),
            shadow_blur: 0.0,
            shadow_color: "rgba(0, 0, 0, 0)".into(),
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            line_dash_offset: 0.0,
            line_dash: Vec::new(),
            image_smoothing_enabled: true,
            origin: (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Rect {
    fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

pub struct Canvas2d {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
    pub state: DrawState,
    stack: Vec<DrawState>,
    path: Vec<Rect>,
    methods: MethodTable<Canvas2d>,
}

impl Canvas2d {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[255, 255, 255]; width as usize * height as usize],
            state: DrawState::default(),
            stack: Vec::new(),
            path: Vec::new(),
            methods: build_methods(),
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Property assignment. Invalid values are ignored, as a 2D context does.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let s = &mut self.state;
        if NUMBER_PROPERTIES.contains(&name) {
            let Some(n) = to_number(Some(&value)).filter(|n| n.is_finite()) else {
                return false;
            };
            match name {
                "lineWidth" if n > 0.0 => s.line_width = n,
                "miterLimit" if n > 0.0 => s.miter_limit = n,
                "globalAlpha" if (0.0..=1.0).contains(&n) => s.global_alpha = n,
                "shadowBlur" if n >= 0.0 => s.shadow_blur = n,
                "shadowOffsetX" => s.shadow_offset_x = n,
                "shadowOffsetY" => s.shadow_offset_y = n,
                "lineDashOffset" => s.line_dash_offset = n,
                _ => return false,
            }
            return true;
        }

        let text = value.to_string();
        match name {
            "fillStyle" => s.fill_style = text,
            "strokeStyle" => s.stroke_style = text,
            "lineCap" => s.line_cap = text,
            "lineJoin" => s.line_join = text,
            "globalCompositeOperation" => s.global_composite_operation = text,
            "font" => s.font = text,
            "textAlign" => s.text_align = text,
            "textBaseline" => s.text_baseline = text,
            "shadowColor" => s.shadow_color = text,
            "imageSmoothingEnabled" => {
                s.image_smoothing_enabled = matches!(value, Value::Bool(true));
            }
            _ => return false,
        }
        true
    }

    fn fill_rect(&mut self, rect: Rect, style: &str) {
        let Some(color) = parse_color(style) else {
            return;
        };
        let (ox, oy) = self.state.origin;
        let alpha = self.state.global_alpha;
        let (x0, x1) = span(rect.x + ox, rect.w, self.width);
        let (y0, y1) = span(rect.y + oy, rect.h, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let index = y * self.width as usize + x;
                let dst = self.pixels[index];
                self.pixels[index] = blend(color, dst, alpha);
            }
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        let (ox, oy) = self.state.origin;
        let (x0, x1) = span(rect.x + ox, rect.w, self.width);
        let (y0, y1) = span(rect.y + oy, rect.h, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.pixels[y * self.width as usize + x] = [255, 255, 255];
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let lw = self.state.line_width;
        let half = lw / 2.0;
        let style = self.state.stroke_style.clone();
        let edges = [
            Rect::new(rect.x - half, rect.y - half, rect.w + lw, lw),
            Rect::new(rect.x - half, rect.y + rect.h - half, rect.w + lw, lw),
            Rect::new(rect.x - half, rect.y + half, lw, rect.h - lw),
            Rect::new(rect.x + rect.w - half, rect.y + half, lw, rect.h - lw),
        ];
        for edge in edges {
            self.fill_rect(edge, &style);
        }
    }
}

/// Clamped pixel range covered by `[start, start + len)`.
fn span(start: f64, len: f64, limit: u32) -> (usize, usize) {
    let (a, b) = if len < 0.0 {
        (start + len, start)
    } else {
        (start, start + len)
    };
    if !a.is_finite() || !b.is_finite() {
        return (0, 0);
    }
    let clamp = |v: f64| v.round().clamp(0.0, f64::from(limit)) as usize;
    (clamp(a), clamp(b))
}

fn blend(src: [u8; 3], dst: [u8; 3], alpha: f64) -> [u8; 3] {
    let mix = |s: u8, d: u8| (f64::from(s) * alpha + f64::from(d) * (1.0 - alpha)).round() as u8;
    [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2])]
}

fn parse_color(style: &str) -> Option<[u8; 3]> {
    let style = style.trim().to_ascii_lowercase();
    if let Some(hex) = style.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits.as_slice() {
            [r, g, b] => Some([r * 17, g * 17, b * 17]),
            [r1, r2, g1, g2, b1, b2] => Some([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2]),
            _ => None,
        };
    }
    let rgb = match style.as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "gray" | "grey" => [128, 128, 128],
        _ => return None,
    };
    Some(rgb)
}

/// Numeric coercion of a call argument; missing or non-numeric becomes NaN.
fn to_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => Some(*n),
        Value::Text(s) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        _ => Some(f64::NAN),
    }
}

fn arg(args: &[Value], index: usize) -> f64 {
    to_number(args.get(index)).unwrap_or(f64::NAN)
}

fn rect_args(args: &[Value]) -> Rect {
    Rect::new(arg(args, 0), arg(args, 1), arg(args, 2), arg(args, 3))
}

fn build_methods() -> MethodTable<Canvas2d> {
    let mut methods = MethodTable::new();
    let mut add = |name: &str, f: fn(&mut Canvas2d, &[Value]) -> Value| {
        methods.insert(name, Method::new(f));
    };

    add("save", |ctx, _| {
        ctx.stack.push(ctx.state.clone());
        Value::Undefined
    });
    add("restore", |ctx, _| {
        if let Some(state) = ctx.stack.pop() {
            ctx.state = state;
        }
        Value::Undefined
    });
    add("fillRect", |ctx, args| {
        let style = ctx.state.fill_style.clone();
        ctx.fill_rect(rect_args(args), &style);
        Value::Undefined
    });
    add("clearRect", |ctx, args| {
        ctx.clear_rect(rect_args(args));
        Value::Undefined
    });
    add("strokeRect", |ctx, args| {
        ctx.stroke_rect(rect_args(args));
        Value::Undefined
    });
    add("beginPath", |ctx, _| {
        ctx.path.clear();
        Value::Undefined
    });
    add("closePath", |_, _| Value::Undefined);
    add("moveTo", |_, _| Value::Undefined);
    add("lineTo", |_, _| Value::Undefined);
    add("rect", |ctx, args| {
        ctx.path.push(rect_args(args));
        Value::Undefined
    });
    add("fill", |ctx, _| {
        let style = ctx.state.fill_style.clone();
        for rect in ctx.path.clone() {
            ctx.fill_rect(rect, &style);
        }
        Value::Undefined
    });
    add("stroke", |ctx, _| {
        for rect in ctx.path.clone() {
            ctx.stroke_rect(rect);
        }
        Value::Undefined
    });
    add("translate", |ctx, args| {
        let (dx, dy) = (arg(args, 0), arg(args, 1));
        if dx.is_finite() && dy.is_finite() {
            ctx.state.origin.0 += dx;
            ctx.state.origin.1 += dy;
        }
        Value::Undefined
    });
    add("setLineDash", |ctx, args| {
        if let Some(Value::Numbers(segments)) = args.first() {
            if segments.iter().all(|n| n.is_finite() && *n >= 0.0) {
                ctx.state.line_dash = segments.clone();
            }
        }
        Value::Undefined
    });
    add("getLineDash", |ctx, _| Value::Numbers(ctx.state.line_dash.clone()));
    add("fillText", |_, _| Value::Undefined);
    add("measureText", |_, _| Value::Object("TextMetrics".into()));

    methods
}

impl Instrumentable for Canvas2d {
    fn methods(&self) -> &MethodTable<Self> {
        &self.methods
    }

    fn methods_mut(&mut self) -> &mut MethodTable<Self> {
        &mut self.methods
    }

    fn properties(&self) -> Vec<Field> {
        ["canvas", "imageSmoothingEnabled"]
            .iter()
            .chain(TEXT_PROPERTIES)
            .chain(NUMBER_PROPERTIES)
            .filter_map(|name| {
                self.property(name).map(|value| Field {
                    name: (*name).to_owned(),
                    value,
                })
            })
            .collect()
    }

    fn property(&self, name: &str) -> Option<Value> {
        let s = &self.state;
        let value = match name {
            "canvas" => Value::Object("HTMLCanvasElement".into()),
            "imageSmoothingEnabled" => Value::Bool(s.image_smoothing_enabled),
            "fillStyle" => Value::from(s.fill_style.as_str()),
            "strokeStyle" => Value::from(s.stroke_style.as_str()),
            "lineCap" => Value::from(s.line_cap.as_str()),
            "lineJoin" => Value::from(s.line_join.as_str()),
            "globalCompositeOperation" => Value::from(s.global_composite_operation.as_str()),
            "font" => Value::from(s.font.as_str()),
            "textAlign" => Value::from(s.text_align.as_str()),
            "textBaseline" => Value::from(s.text_baseline.as_str()),
            "shadowColor" => Value::from(s.shadow_color.as_str()),
            "lineWidth" => Value::from(s.line_width),
            "miterLimit" => Value::from(s.miter_limit),
            "globalAlpha" => Value::from(s.global_alpha),
            "shadowBlur" => Value::from(s.shadow_blur),
            "shadowOffsetX" => Value::from(s.shadow_offset_x),
            "shadowOffsetY" => Value::from(s.shadow_offset_y),
            "lineDashOffset" => Value::from(s.line_dash_offset),
            _ => return None,
        };
        Some(value)
    }
}

impl SurfaceSnapshot for Canvas2d {
    /// Encodes the surface as a binary PPM.
    async fn snapshot(&self) -> Result<EncodedImage, CollaboratorError> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut bytes = Vec::with_capacity(header.len() + self.pixels.len() * 3);
        bytes.extend_from_slice(header.as_bytes());
        for pixel in &self.pixels {
            bytes.extend_from_slice(pixel);
        }
        Ok(EncodedImage {
            mime: "image/x-portable-pixmap".into(),
            width: self.width,
            height: self.height,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_paints_inside_the_clip() {
        let mut ctx = Canvas2d::new(4, 4);
        ctx.set("fillStyle", "#f00");
        ctx.call("fillRect", &[1.into(), 1.into(), 10.into(), 2.into()])
            .unwrap();

        assert_eq!(ctx.pixel(0, 0), Some([255, 255, 255]));
        assert_eq!(ctx.pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(ctx.pixel(3, 2), Some([255, 0, 0]));
        assert_eq!(ctx.pixel(1, 3), Some([255, 255, 255]));
    }

    #[test]
    fn save_and_restore_round_trip_state() {
        let mut ctx = Canvas2d::new(2, 2);
        ctx.call("save", &[]).unwrap();
        ctx.set("lineWidth", 4);
        ctx.call("translate", &[1.into(), 1.into()]).unwrap();
        ctx.call("restore", &[]).unwrap();
        assert_eq!(ctx.state, DrawState::default());
    }

    #[test]
    fn invalid_assignments_are_ignored() {
        let mut ctx = Canvas2d::new(1, 1);
        assert!(!ctx.set("lineWidth", -1));
        assert!(!ctx.set("globalAlpha", 2));
        assert!(!ctx.set("lineWidth", "wide"));
        assert!(!ctx.set("bogus", 1));
        assert_eq!(ctx.state.line_width, 1.0);
    }

    #[test]
    fn discovery_skips_non_scalar_properties() {
        let ctx = Canvas2d::new(1, 1);
        let scalars: Vec<String> = ctx
            .properties()
            .into_iter()
            .filter(|f| f.value.is_scalar())
            .map(|f| f.name)
            .collect();
        assert_eq!(
            scalars.len(),
            TEXT_PROPERTIES.len() + NUMBER_PROPERTIES.len()
        );
        assert!(!scalars.iter().any(|n| n == "canvas" || n == "imageSmoothingEnabled"));
    }

    #[test]
    fn colors_parse() {
        assert_eq!(parse_color("#0a0B0c"), Some([10, 11, 12]));
        assert_eq!(parse_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_color("Orange"), Some([255, 165, 0]));
        assert_eq!(parse_color("rgba(0, 0, 0, 0)"), None);
    }

    #[tokio::test]
    async fn snapshot_is_a_ppm() {
        let ctx = Canvas2d::new(2, 1);
        let image = ctx.snapshot().await.unwrap();
        assert!(image.bytes.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(image.bytes.len(), 11 + 6);
    }
}
