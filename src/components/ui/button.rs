use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded text-sm transition-colors disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg]:shrink-0 outline-none focus-visible:ring-2 focus-visible:ring-blue-300 hover:cursor-pointer active:scale-[0.98] touch-manipulation select-none",
        variants: {
            variant: {
                Default: "bg-blue-500 text-white hover:bg-blue-600",
                Success: "bg-green-500 text-white hover:bg-green-600",
                Ghost: "bg-transparent text-blue-500 hover:text-blue-700",
            },
            size: {
                Default: "p-2",
                Icon: "size-7",
            }
        },
        component: {
            element: button
        }
    }
}
