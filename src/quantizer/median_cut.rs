use std::cmp::Reverse;

use log::{debug, trace};
use priority_queue::PriorityQueue;

use crate::{Color, Error, Palette, Quantizer};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Dimension {
    R,
    G,
    B,
}

impl Dimension {
    fn channel(self, color: Color) -> u8 {
        match self {
            Dimension::R => color.red(),
            Dimension::G => color.green(),
            Dimension::B => color.blue(),
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct MinMax {
    min: u8,
    max: u8,
}

impl MinMax {
    fn from_value(value: u8) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn extend(&mut self, value: u8) {
        if value < self.min {
            self.min = value;
        }
        if self.max < value {
            self.max = value;
        }
    }

    fn range(&self) -> u32 {
        (self.max - self.min) as u32
    }
}

/// Per channel bounds of a set of samples.
#[derive(Debug, Copy, Clone)]
struct Bounds {
    r: MinMax,
    g: MinMax,
    b: MinMax,
}

impl Bounds {
    fn new(color: Color) -> Self {
        Self {
            r: MinMax::from_value(color.red()),
            g: MinMax::from_value(color.green()),
            b: MinMax::from_value(color.blue()),
        }
    }

    fn extend(&mut self, color: Color) {
        self.r.extend(color.red());
        self.g.extend(color.green());
        self.b.extend(color.blue());
    }

    fn volume(&self) -> u32 {
        self.r.range() * self.g.range() * self.b.range()
    }

    /// Widest channel, ties resolved R before G before B.
    fn longest_dimension(&self) -> Dimension {
        let r = self.r.range();
        let g = self.g.range();
        let b = self.b.range();
        if r >= g && r >= b {
            Dimension::R
        } else if g >= b {
            Dimension::G
        } else {
            Dimension::B
        }
    }

    /// At least two distinct RGB values live inside these bounds.
    fn is_splittable(&self) -> bool {
        self.r.range() + self.g.range() + self.b.range() > 0
    }
}

/// Samples (alpha stripped) together with their bounds.
#[derive(Debug)]
struct ColorBox {
    bounds: Bounds,
    colors: Vec<Color>,
}

impl ColorBox {
    fn from_colors(colors: Vec<Color>) -> Self {
        debug_assert!(!colors.is_empty());
        let mut bounds = Bounds::new(colors[0]);
        for &color in &colors[1..] {
            bounds.extend(color);
        }
        Self { bounds, colors }
    }

    fn volume(&self) -> u32 {
        self.bounds.volume()
    }

    fn is_splittable(&self) -> bool {
        self.bounds.is_splittable()
    }

    fn split(mut self) -> (ColorBox, ColorBox) {
        let dimension = self.bounds.longest_dimension();
        // Stable, so equal channel values keep their sample order.
        self.colors.sort_by_key(|&c| dimension.channel(c));
        let upper = self.colors.split_off(self.colors.len() / 2);
        trace!(
            "split box of {} samples along {:?} into {} + {}",
            self.colors.len() + upper.len(),
            dimension,
            self.colors.len(),
            upper.len()
        );
        (ColorBox::from_colors(self.colors), ColorBox::from_colors(upper))
    }

    /// Per channel floor mean, fully opaque.
    fn average(&self) -> Color {
        let (r, g, b) = self.colors.iter().fold((0u64, 0u64, 0u64), |(r, g, b), c| {
            (r + c.red() as u64, g + c.green() as u64, b + c.blue() as u64)
        });
        let n = self.colors.len().max(1) as u64;
        Color::from_rgb((r / n) as u8, (g / n) as u8, (b / n) as u8)
    }
}

/// Queue priority of a box.
///
/// Splittable boxes come before exhausted ones, then larger volumes, then
/// older boxes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct BoxKey {
    splittable: bool,
    volume: u32,
    order: Reverse<usize>,
}

struct BoxQueue {
    queue: PriorityQueue<usize, BoxKey>,
    boxes: Vec<Option<ColorBox>>,
}

impl BoxQueue {
    fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
            boxes: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn push(&mut self, vbox: ColorBox) {
        let order = self.boxes.len();
        let key = BoxKey {
            splittable: vbox.is_splittable(),
            volume: vbox.volume(),
            order: Reverse(order),
        };
        self.boxes.push(Some(vbox));
        self.queue.push(order, key);
    }

    fn pop(&mut self) -> Option<ColorBox> {
        let (order, _) = self.queue.pop()?;
        self.boxes[order].take()
    }

    fn into_boxes(self) -> impl Iterator<Item = ColorBox> {
        self.boxes.into_iter().flatten()
    }
}

fn split_boxes(queue: &mut BoxQueue, target: usize) {
    while queue.len() < target {
        let Some(vbox) = queue.pop() else {
            break;
        };
        if !vbox.is_splittable() {
            // Nothing left that could be split.
            queue.push(vbox);
            break;
        }
        let (a, b) = vbox.split();
        queue.push(a);
        queue.push(b);
    }
}

/// Median cut quantizer
///
/// Repeatedly splits the box with the largest RGB volume at the median of
/// its widest channel, then averages every remaining box into one palette
/// entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct MedianCut;

impl Quantizer for MedianCut {
    fn palette(&self, samples: &[Color], max_colors: usize) -> Result<Palette, Error> {
        if max_colors < 2 {
            return Err(Error::ColorCountOutOfBounds(max_colors));
        }
        if samples.is_empty() {
            return Err(Error::NoSamples);
        }

        let colors = samples.iter().map(|c| c.rgb_only()).collect();
        let mut queue = BoxQueue::new();
        queue.push(ColorBox::from_colors(colors));
        split_boxes(&mut queue, max_colors);

        let boxes = queue.len();
        let palette: Palette = queue.into_boxes().map(|b| b.average()).collect();
        debug!(
            "median cut: {} samples, {} boxes, {} palette colors",
            samples.len(),
            boxes,
            palette.len()
        );
        Ok(palette)
    }
}
