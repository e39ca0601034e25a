/// Connected components over a thresholded well crop
/// Finds foreground regions and reports their bounding box and pixel area
use std::collections::HashMap;

use image::GrayImage;

use crate::models::PixelRect;

/// Union-Find data structure
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    /// Create `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    /// Root of the set containing `x`, with path halving
    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merge the sets containing `x` and `y`
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x != root_y {
            self.parent[root_x as usize] = root_y;
        }
    }
}

/// One 8-connected foreground region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Bounding box in the coordinates of the analysed image
    pub bounds: PixelRect,
    /// Number of foreground pixels
    pub area: u64,
}

/// Find 8-connected regions of non-zero pixels
pub fn find_foreground_regions(binary: &GrayImage) -> Vec<Component> {
    let (width, height) = (binary.width() as usize, binary.height() as usize);
    let is_fg = |x: usize, y: usize| binary.get_pixel(x as u32, y as u32)[0] != 0;

    let mut labels = vec![0u32; width * height];
    let mut next_label = 1u32;
    // label 0 is background; allocate for the worst case of one label per pixel
    let mut uf = UnionFind::new(width * height + 1);

    // First pass: provisional labels
    for y in 0..height {
        for x in 0..width {
            if !is_fg(x, y) {
                continue;
            }

            let mut neighbors = [0u32; 4];
            let mut count = 0;
            // left, upper-left, above, upper-right
            if x > 0 && labels[y * width + x - 1] != 0 {
                neighbors[count] = labels[y * width + x - 1];
                count += 1;
            }
            if y > 0 {
                let above = (y - 1) * width;
                if x > 0 && labels[above + x - 1] != 0 {
                    neighbors[count] = labels[above + x - 1];
                    count += 1;
                }
                if labels[above + x] != 0 {
                    neighbors[count] = labels[above + x];
                    count += 1;
                }
                if x + 1 < width && labels[above + x + 1] != 0 {
                    neighbors[count] = labels[above + x + 1];
                    count += 1;
                }
            }

            let idx = y * width + x;
            match neighbors[..count].iter().min() {
                None => {
                    labels[idx] = next_label;
                    next_label += 1;
                }
                Some(&min_label) => {
                    labels[idx] = min_label;
                    for &l in &neighbors[..count] {
                        if l != min_label {
                            uf.union(min_label, l);
                        }
                    }
                }
            }
        }
    }

    // Second pass: bounding boxes and areas per root
    let mut regions: HashMap<u32, (usize, usize, usize, usize, u64)> = HashMap::new();
    for y in 0..height {
        for x in 0..width {
            let label = labels[y * width + x];
            if label == 0 {
                continue;
            }
            let root = uf.find(label);
            let entry = regions.entry(root).or_insert((x, y, x, y, 0));
            entry.0 = entry.0.min(x);
            entry.1 = entry.1.min(y);
            entry.2 = entry.2.max(x);
            entry.3 = entry.3.max(y);
            entry.4 += 1;
        }
    }

    regions
        .into_values()
        .map(|(x0, y0, x1, y1, area)| Component {
            bounds: PixelRect::new(
                x0 as u32,
                y0 as u32,
                (x1 - x0 + 1) as u32,
                (y1 - y0 + 1) as u32,
            ),
            area,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(img: &mut GrayImage, rect: PixelRect) {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn test_single_square() {
        let mut img = GrayImage::new(10, 10);
        fill(&mut img, PixelRect::new(2, 2, 2, 2));

        let regions = find_foreground_regions(&img);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounds, PixelRect::new(2, 2, 2, 2));
        assert_eq!(regions[0].area, 4);
    }

    #[test]
    fn test_separate_and_diagonal_regions() {
        let mut img = GrayImage::new(20, 20);
        fill(&mut img, PixelRect::new(0, 0, 3, 3));
        fill(&mut img, PixelRect::new(10, 10, 5, 4));
        // diagonal touch joins under 8-connectivity
        img.put_pixel(15, 14, Luma([255]));

        let mut regions = find_foreground_regions(&img);
        regions.sort_by_key(|c| c.bounds.x);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].area, 9);
        assert_eq!(regions[1].bounds, PixelRect::new(10, 10, 6, 5));
        assert_eq!(regions[1].area, 21);
    }

    #[test]
    fn test_u_shape_merges() {
        // Two arms that only meet at the bottom row
        let mut img = GrayImage::new(5, 4);
        fill(&mut img, PixelRect::new(0, 0, 1, 4));
        fill(&mut img, PixelRect::new(4, 0, 1, 4));
        fill(&mut img, PixelRect::new(0, 3, 5, 1));

        let regions = find_foreground_regions(&img);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounds, PixelRect::new(0, 0, 5, 4));
        assert_eq!(regions[0].area, 11);
    }

    #[test]
    fn test_blank_image() {
        assert!(find_foreground_regions(&GrayImage::new(8, 8)).is_empty());
    }
}
