use crate::{
    director::lingo::datum::{ColorRef, Datum},
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct ImageDatumHandlers {}

fn color_to_rgba(color: &ColorRef) -> u32 {
    match color {
        ColorRef::Rgb(r, g, b) => {
            0xFF000000 | ((*r as u32) << 16) | ((*g as u32) << 8) | (*b as u32)
        }
        ColorRef::PaletteIndex(i) => {
            // grayscale approximation for palette colours
            let v = 255 - *i as u32;
            0xFF000000 | (v << 16) | (v << 8) | v
        }
    }
}

impl ImageDatumHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        match handler_name {
            "fill" => Self::fill(vm, datum, args),
            "copyPixels" => Self::copy_pixels(vm, datum, args),
            "crop" => Self::crop(vm, datum, args),
            "duplicate" => Ok(vm.duplicate_datum(datum)),
            "getPixel" => Self::get_pixel(vm, datum, args),
            "setPixel" => Self::set_pixel(vm, datum, args),
            "draw" => Self::fill(vm, datum, args),
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("image".to_string()))),
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for image datum"
            ))),
        }
    }

    pub fn get_prop(
        vm: &mut LingoVm,
        datum: &DatumRef,
        prop_name: &str,
    ) -> Result<DatumRef, ScriptError> {
        let bitmap_ref = vm.get_datum(datum).to_bitmap_ref()?;
        let bitmap = vm
            .bitmap_manager
            .get_bitmap(bitmap_ref)
            .ok_or_else(|| ScriptError::new("Image not found".to_string()))?;
        let result = match prop_name {
            "width" => Datum::Int(bitmap.width as i32),
            "height" => Datum::Int(bitmap.height as i32),
            "depth" => Datum::Int(bitmap.bit_depth as i32),
            "rect" => Datum::Rect((0, 0, bitmap.width as i32, bitmap.height as i32)),
            "ilk" => Datum::Symbol("image".to_string()),
            _ => {
                return Err(ScriptError::new(format!(
                    "Invalid image property {prop_name}"
                )))
            }
        };
        Ok(vm.alloc_datum(result))
    }

    pub fn set_prop(
        _vm: &mut LingoVm,
        _datum: &DatumRef,
        prop_name: &str,
        _value_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        Err(ScriptError::new(format!(
            "Cannot set image property {prop_name}"
        )))
    }

    fn fill(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let bitmap_ref = vm.get_datum(datum).to_bitmap_ref()?;
        let rect = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing rect for fill".to_string())
            })?)
            .to_rect()?;
        let color = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing color for fill".to_string())
            })?)
            .to_color()?;
        let rgba = color_to_rgba(&color);
        let bitmap = vm
            .bitmap_manager
            .get_bitmap_mut(bitmap_ref)
            .ok_or_else(|| ScriptError::new("Image not found".to_string()))?;
        bitmap.fill_rect(rect, rgba);
        Ok(DatumRef::Void)
    }

    fn copy_pixels(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let dest_ref = vm.get_datum(datum).to_bitmap_ref()?;
        let src_ref = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing source image".to_string())
            })?)
            .to_bitmap_ref()?;
        let dst_rect = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing destination rect".to_string())
            })?)
            .to_rect()?;
        let src_rect = vm
            .get_datum(args.get(2).ok_or_else(|| {
                ScriptError::new("Missing source rect".to_string())
            })?)
            .to_rect()?;

        let src = vm
            .bitmap_manager
            .get_bitmap(src_ref)
            .cloned()
            .ok_or_else(|| ScriptError::new("Source image not found".to_string()))?;
        let dest = vm
            .bitmap_manager
            .get_bitmap_mut(dest_ref)
            .ok_or_else(|| ScriptError::new("Image not found".to_string()))?;
        dest.copy_pixels(&src, dst_rect, src_rect);
        Ok(DatumRef::Void)
    }

    fn crop(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let bitmap_ref = vm.get_datum(datum).to_bitmap_ref()?;
        let rect = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing rect for crop".to_string())
            })?)
            .to_rect()?;
        let cropped = vm
            .bitmap_manager
            .get_bitmap(bitmap_ref)
            .map(|bitmap| bitmap.crop(rect))
            .ok_or_else(|| ScriptError::new("Image not found".to_string()))?;
        let new_ref = vm.bitmap_manager.add_bitmap(cropped);
        Ok(vm.alloc_datum(Datum::Image(new_ref)))
    }

    fn get_pixel(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let bitmap_ref = vm.get_datum(datum).to_bitmap_ref()?;
        let x = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing x for getPixel".to_string())
            })?)
            .int_value()?;
        let y = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing y for getPixel".to_string())
            })?)
            .int_value()?;
        let pixel = vm
            .bitmap_manager
            .get_bitmap(bitmap_ref)
            .and_then(|bitmap| bitmap.get_pixel(x, y));
        match pixel {
            Some(rgba) => Ok(vm.alloc_datum(Datum::Color(ColorRef::Rgb(
                ((rgba >> 16) & 0xFF) as u8,
                ((rgba >> 8) & 0xFF) as u8,
                (rgba & 0xFF) as u8,
            )))),
            None => Ok(DatumRef::Void),
        }
    }

    fn set_pixel(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let bitmap_ref = vm.get_datum(datum).to_bitmap_ref()?;
        let x = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing x for setPixel".to_string())
            })?)
            .int_value()?;
        let y = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing y for setPixel".to_string())
            })?)
            .int_value()?;
        let color = vm
            .get_datum(args.get(2).ok_or_else(|| {
                ScriptError::new("Missing color for setPixel".to_string())
            })?)
            .to_color()?;
        let rgba = color_to_rgba(&color);
        let changed = vm
            .bitmap_manager
            .get_bitmap_mut(bitmap_ref)
            .map(|bitmap| bitmap.set_pixel(x, y, rgba))
            .unwrap_or(false);
        Ok(vm.alloc_datum(crate::director::lingo::datum::datum_bool(changed)))
    }
}
